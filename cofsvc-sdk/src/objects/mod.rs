mod coffee;
mod order;

pub use coffee::Coffee;
pub use order::CoffeeOrder;
