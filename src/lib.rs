pub mod command;
pub mod config;
pub mod lights;
pub mod select;
pub mod show;
pub mod structure;

pub mod prelude {
    pub use crate::{
        command::*, config::*, lights::*, select::*, show::prelude::*, structure::*,
    };
}
