use crate::Status;

/// OK / NOT OK counts across every status column of every reading.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StatusTally {
    pub ok: u64,
    pub not_ok: u64,
}

impl StatusTally {
    /// Counts exact labels only; anything else stored in a status column is skipped.
    pub fn add(&mut self, label: &str) {
        match label.parse::<Status>() {
            Ok(Status::Ok) => self.ok += 1,
            Ok(Status::NotOk) => self.not_ok += 1,
            Err(_) => {}
        }
    }

    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a (String, String, String)>,
    {
        let mut tally = Self::default();
        for (current, temperature, vibration) in rows {
            tally.add(current);
            tally.add(temperature);
            tally.add(vibration);
        }
        tally
    }

    pub fn total(&self) -> u64 {
        self.ok + self.not_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(a: &str, b: &str, c: &str) -> (String, String, String) {
        (a.to_owned(), b.to_owned(), c.to_owned())
    }

    #[test]
    fn empty_table_counts_nothing() {
        let rows: Vec<(String, String, String)> = Vec::new();
        let tally = StatusTally::from_rows(&rows);
        assert_eq!(tally, StatusTally { ok: 0, not_ok: 0 });
    }

    #[test]
    fn columns_are_pooled() {
        let rows = vec![
            row("OK", "NOT OK", "NOT OK"),
            row("OK", "OK", "OK"),
            row("NOT OK", "OK", "NOT OK"),
        ];
        let tally = StatusTally::from_rows(&rows);
        assert_eq!(tally.ok, 5);
        assert_eq!(tally.not_ok, 4);
        assert_eq!(tally.total(), 3 * rows.len() as u64);
    }

    #[test]
    fn unknown_labels_are_skipped() {
        let rows = vec![row("OK", "ok", "")];
        assert_eq!(StatusTally::from_rows(&rows), StatusTally { ok: 1, not_ok: 0 });
    }
}
