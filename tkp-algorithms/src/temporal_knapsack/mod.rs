pub mod lahc;
