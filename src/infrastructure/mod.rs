pub mod catalog_repo;
pub mod google_maps;
pub mod kafka;
pub mod models;
pub mod order_repo;

#[cfg(test)]
pub(crate) mod test_support;
