//! `chatpal` — command-line front end for the Health ChatPal service.

pub mod bootstrap;
pub mod cli;
pub mod render;
