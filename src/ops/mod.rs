pub mod batch;
pub mod collection;
pub mod search;
pub mod sort;

#[cfg(test)]
pub mod test_store;
