/// Split a comma-separated CLI value, trimming entries and dropping empty ones.
pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" smoke, ,reload,  noise ");
        assert_eq!(parts, vec!["smoke", "reload", "noise"]);
        assert!(split_csv("").is_empty());
    }
}
