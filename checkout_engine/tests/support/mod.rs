#![allow(dead_code)]
pub mod prepare_env;
pub mod processor;
pub mod seed;
