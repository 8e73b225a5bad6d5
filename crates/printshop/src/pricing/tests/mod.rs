mod common;
mod offset;
