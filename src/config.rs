pub const BLOCK_SIZE: usize = 512;
pub const MAX_FILE_SIZE: usize = 1024 * 1024 * 100; // 100 MiB
pub const MAX_BLOCKS: usize = MAX_FILE_SIZE / BLOCK_SIZE; // Per-file block cap

pub const FD_TABLE_FLOOR: usize = 32; // Initial descriptor table capacity, doubled on growth
