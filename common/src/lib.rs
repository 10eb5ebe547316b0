#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod show;

pub use show::*;
