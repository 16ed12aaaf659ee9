/// Compute effective limit with precedence: local arg -> global flag -> configured default.
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, fallback: u32) -> u32 {
    local.or(global).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::effective_limit;

    #[test]
    fn subcommand_limit_wins() {
        assert_eq!(effective_limit(Some(5), Some(10), 20), 5);
    }

    #[test]
    fn global_flag_fills_in() {
        assert_eq!(effective_limit(None, Some(10), 20), 10);
    }

    #[test]
    fn configured_default_is_the_floor() {
        assert_eq!(effective_limit(None, None, 20), 20);
    }
}
