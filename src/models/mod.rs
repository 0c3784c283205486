pub mod trademark;
