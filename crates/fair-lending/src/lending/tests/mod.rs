mod common;
mod preprocessing;
