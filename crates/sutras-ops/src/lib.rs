pub mod ops_check;
pub mod ops_fetch;
pub mod ops_lock;
pub mod ops_registry;
pub mod ops_resolve;
pub mod ops_tree;

#[cfg(test)]
pub(crate) mod test_support;
