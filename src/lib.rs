#![allow(async_fn_in_trait)]

pub mod commands;
pub mod context;
pub mod logs;
pub mod periodic;
pub mod runescape;
pub mod time;
pub mod user;
pub mod utils;
