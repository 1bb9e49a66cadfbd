pub mod curves;
pub mod peaks;

pub type Subject = String;
pub type Contrast = String;
