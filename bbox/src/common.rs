pub use num_traits::Num;
