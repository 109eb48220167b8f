pub mod bits;
pub mod bus;
pub mod clock;
pub mod component;
pub mod machine;
pub mod memory;

pub use bus::{AddressBus, Bus, OPEN_BUS};
pub use clock::{Clocked, WriteListener};
pub use component::{Component, ComponentId};
pub use machine::Machine;
pub use memory::Memory;
