pub mod assembler;
pub mod combine;
pub mod loader;
pub mod negotiation;
