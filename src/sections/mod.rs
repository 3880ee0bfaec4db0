pub mod sect3;
pub mod sect5;
pub mod sect6;
pub mod sect7;
