pub mod analysis;
pub mod enums;
pub mod symptom;

pub use analysis::*;
pub use enums::*;
pub use symptom::*;
