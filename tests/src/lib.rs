#[cfg(test)]
mod classification;
#[cfg(test)]
mod database;
