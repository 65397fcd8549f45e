pub mod swap_worker;
