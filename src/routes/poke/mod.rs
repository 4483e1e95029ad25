mod handler;
mod model;

pub use handler::poke;
pub use model::{PokeRequest, poke_message, poke_opponent};
