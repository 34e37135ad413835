pub mod config;
pub mod logging;

pub mod checksum;
pub mod fetch;
pub mod hasher;
pub mod manifest;
pub mod remote;
pub mod verify;
