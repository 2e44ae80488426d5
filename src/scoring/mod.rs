pub mod pagerank;
pub mod scorer;
