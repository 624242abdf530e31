use anyhow::{anyhow, Result};

pub fn validate_dir(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("{} is empty", field));
    }
    if value.contains('\0') {
        return Err(anyhow!("{} contains a NUL byte", field));
    }
    Ok(())
}
