pub mod capture;
pub mod metrics;
pub mod plan;
pub mod traffic;

#[cfg(test)]
mod test;
