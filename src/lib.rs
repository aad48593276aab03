//! Pure Rust async client for the [Minecraft RCON protocol](https://wiki.vg/RCON):
//! authenticate with a password, relay one command, return the server's reply.
pub mod client;
pub mod error;
pub mod packet;
