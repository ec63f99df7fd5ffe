pub(crate) mod elasticsearch;
pub(crate) mod memory;
