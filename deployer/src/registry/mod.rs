//! Archive registry

pub mod push;
