pub mod random_pool;
