pub mod chars;
pub mod digits;
