pub use {fee::BaseFee, header::HeaderView, num::BigUint};

mod fee;
mod header;
