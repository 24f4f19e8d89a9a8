#[cfg(test)]
pub(crate) mod common;

#[cfg(test)]
mod test_damage;







#[cfg(test)]
mod test_runner;
