#![allow(unused)]

mod common;

use userfs::BLOCK_SIZE;
use userfs::Error;
use userfs::OpenFlag;
use userfs::UserFs;

#[test]
fn open_write_read_back() {
    common::init_logging();
    let mut fs = UserFs::new();
    let fd0 = fs.open("a", OpenFlag::Create | OpenFlag::WriteOnly).unwrap();
    assert_eq!(fs.write(fd0, b"hello").unwrap(), 5);
    fs.close(fd0).unwrap();

    let fd1 = fs.open("a", OpenFlag::ReadOnly).unwrap();
    let mut buf = [0u8; 10];
    assert_eq!(fs.read(fd1, &mut buf).unwrap(), 5);
    assert_eq!(&buf[..5], b"hello");
    assert_eq!(fs.last_error(), None);
}

#[test]
fn multi_block_round_trip() {
    common::init_logging();
    let mut fs = UserFs::new();
    let data: Vec<u8> = (0..BLOCK_SIZE * 3 + 100).map(|i| (i % 251) as u8).collect();

    let fd = fs.open("big", OpenFlag::Create | OpenFlag::ReadWrite).unwrap();
    assert_eq!(fs.write(fd, &data).unwrap(), data.len());

    // A fresh descriptor reads from the start of the chain.
    let fd2 = fs.open("big", OpenFlag::ReadOnly).unwrap();
    let mut buf = vec![0u8; data.len() + 64];
    assert_eq!(fs.read(fd2, &mut buf).unwrap(), data.len());
    assert_eq!(&buf[..data.len()], &data[..]);
    log!("round-tripped {} bytes across {} blocks", data.len(), data.len().div_ceil(BLOCK_SIZE));

    // Further reads report end of file, not an error.
    assert_eq!(fs.read(fd2, &mut buf).unwrap(), 0);
    assert_eq!(fs.last_error(), None);
}

#[test]
fn incremental_writes_accumulate() {
    common::init_logging();
    let mut fs = UserFs::new();
    let fd = fs.open("log.txt", OpenFlag::Create).unwrap();
    for chunk in [&b"alpha "[..], &b"beta "[..], &b"gamma"[..]] {
        assert_eq!(fs.write(fd, chunk).unwrap(), chunk.len());
    }
    let fd2 = fs.open("log.txt", OpenFlag::ReadOnly).unwrap();
    let mut buf = [0u8; 32];
    let n = fs.read(fd2, &mut buf).unwrap();
    assert_eq!(&buf[..n], b"alpha beta gamma");
}

#[test]
fn zero_length_operations() {
    common::init_logging();
    let mut fs = UserFs::new();
    let fd = fs.open("empty", OpenFlag::Create).unwrap();
    assert_eq!(fs.write(fd, b"").unwrap(), 0);
    assert_eq!(fs.last_error(), None);
    assert_eq!(fs.read(fd, &mut []).unwrap(), 0);
    assert_eq!(fs.last_error(), None);
    // Reading a file that has no blocks yet also yields 0.
    let mut buf = [0u8; 8];
    assert_eq!(fs.read(fd, &mut buf).unwrap(), 0);
}

#[test]
fn handle_validity() {
    common::init_logging();
    let mut fs = UserFs::new();
    let mut buf = [0u8; 4];
    assert_eq!(fs.read(9999, &mut buf), Err(Error::NoFile));
    assert_eq!(fs.last_error(), Some(Error::NoFile));
    assert_eq!(fs.write(0, b"x"), Err(Error::NoFile));
    assert_eq!(fs.resize(3, 100), Err(Error::NoFile));
    assert_eq!(fs.close(0), Err(Error::NoFile));

    // A closed handle behaves like an out-of-range one.
    let fd = fs.open("f", OpenFlag::Create).unwrap();
    fs.close(fd).unwrap();
    assert_eq!(fs.read(fd, &mut buf), Err(Error::NoFile));
    assert_eq!(fs.close(fd), Err(Error::NoFile));
}

#[test]
fn permissions() {
    common::init_logging();
    let mut fs = UserFs::new();
    let fd = fs.open("p", OpenFlag::Create | OpenFlag::WriteOnly).unwrap();
    fs.write(fd, b"secret").unwrap();
    let mut buf = [0u8; 8];
    assert_eq!(fs.read(fd, &mut buf), Err(Error::NoPermission));
    assert_eq!(fs.last_error(), Some(Error::NoPermission));

    let ro = fs.open("p", OpenFlag::ReadOnly).unwrap();
    assert_eq!(fs.write(ro, b"nope"), Err(Error::NoPermission));
    assert_eq!(fs.resize(ro, 2), Err(Error::NoPermission));

    // Mixing access flags is rejected outright.
    assert_eq!(
        fs.open("p", OpenFlag::ReadOnly | OpenFlag::WriteOnly),
        Err(Error::NoPermission)
    );

    // Create alone defaults to read-write.
    let rw = fs.open("q", OpenFlag::Create).unwrap();
    fs.write(rw, b"both").unwrap();
    let rw2 = fs.open("q", OpenFlag::ReadWrite).unwrap();
    assert_eq!(fs.read(rw2, &mut buf).unwrap(), 4);
    assert_eq!(&buf[..4], b"both");
}

#[test]
fn open_without_create_fails() {
    common::init_logging();
    let mut fs = UserFs::new();
    assert_eq!(fs.open("missing", OpenFlag::ReadWrite), Err(Error::NoFile));
    assert_eq!(fs.last_error(), Some(Error::NoFile));
}

#[test]
fn descriptor_slots_are_reused_lowest_first() {
    common::init_logging();
    let mut fs = UserFs::new();
    let fd0 = fs.open("a", OpenFlag::Create).unwrap();
    let fd1 = fs.open("b", OpenFlag::Create).unwrap();
    let fd2 = fs.open("c", OpenFlag::Create).unwrap();
    assert_eq!((fd0, fd1, fd2), (0, 1, 2));

    fs.close(fd1).unwrap();
    let reused = fs.open("d", OpenFlag::Create).unwrap();
    assert_eq!(reused, 1);
    log!("slot {} reused after close", reused);
}

#[test]
fn destroy_tears_everything_down() {
    common::init_logging();
    let mut fs = UserFs::new();
    let fd = fs.open("a", OpenFlag::Create).unwrap();
    fs.write(fd, b"data").unwrap();
    fs.open("b", OpenFlag::Create).unwrap();

    fs.destroy();

    let mut buf = [0u8; 4];
    assert_eq!(fs.read(fd, &mut buf), Err(Error::NoFile));
    assert_eq!(fs.open("a", OpenFlag::ReadOnly), Err(Error::NoFile));

    // The engine stays usable after teardown.
    let fd = fs.open("a", OpenFlag::Create).unwrap();
    assert_eq!(fs.read(fd, &mut buf).unwrap(), 0);
}
