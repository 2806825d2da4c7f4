//! Character-class inventory per column
//!
//! Every character of every non-missing cell (rendered as text) is put in
//! exactly one of nine classes. The classes are tried in a fixed order and
//! the first one whose predicate accepts the character wins.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::model::{CellValue, Column, Table};

use super::ensure_table;
use super::progress::{NoProgress, ProgressObserver};

/// Semantic character class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    Numeric,
    LettersLowercase,
    LettersUppercase,
    Whitespace,
    BracketsQuotes,
    Punctuation,
    Operators,
    OtherAscii,
    OtherNonAscii,
}

impl CharClass {
    /// All classes in output column order
    pub const ALL: [CharClass; 9] = [
        CharClass::Numeric,
        CharClass::LettersLowercase,
        CharClass::LettersUppercase,
        CharClass::Whitespace,
        CharClass::BracketsQuotes,
        CharClass::Punctuation,
        CharClass::Operators,
        CharClass::OtherAscii,
        CharClass::OtherNonAscii,
    ];

    /// Output column name
    pub fn name(self) -> &'static str {
        match self {
            CharClass::Numeric => "numeric",
            CharClass::LettersLowercase => "letters_lowercase",
            CharClass::LettersUppercase => "letters_uppercase",
            CharClass::Whitespace => "whitespace",
            CharClass::BracketsQuotes => "brackets_quotes",
            CharClass::Punctuation => "punctuation",
            CharClass::Operators => "operators",
            CharClass::OtherAscii => "other_ascii",
            CharClass::OtherNonAscii => "other_non_ascii",
        }
    }
}

impl std::fmt::Display for CharClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub const BRACKETS_QUOTES: &str = "'\"()[]{}";
pub const PUNCTUATION: &str = ".,;:!?";
pub const OPERATORS: &str = "+-*/=%<>";

/// Classification rules, evaluated top to bottom.
pub const RULES: [(CharClass, fn(char) -> bool); 9] = [
    (CharClass::Numeric, |c| c.is_ascii_digit()),
    (CharClass::LettersLowercase, |c| c.is_ascii_lowercase()),
    (CharClass::LettersUppercase, |c| c.is_ascii_uppercase()),
    (CharClass::Whitespace, is_space),
    (CharClass::BracketsQuotes, |c| BRACKETS_QUOTES.contains(c)),
    (CharClass::Punctuation, |c| PUNCTUATION.contains(c)),
    (CharClass::Operators, |c| OPERATORS.contains(c)),
    (CharClass::OtherAscii, |c| c.is_ascii()),
    (CharClass::OtherNonAscii, |_| true),
];

/// Unicode whitespace plus the ASCII file, group, record and unit
/// separators (U+001C..=U+001F)
fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Text scanned for a cell. Booleans read `True`/`False`, the spelling the
/// CSV reader accepts in any case.
fn cell_text(value: &CellValue) -> Cow<'_, str> {
    match value {
        CellValue::Bool(true) => Cow::Borrowed("True"),
        CellValue::Bool(false) => Cow::Borrowed("False"),
        other => other.display(),
    }
}

/// Class of a single character
pub fn classify(c: char) -> CharClass {
    RULES
        .iter()
        .find(|(_, accepts)| accepts(c))
        .map(|(class, _)| *class)
        .unwrap_or(CharClass::OtherNonAscii)
}

/// Distinct characters of one column, bucketed by class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterClassSet {
    pub column: String,
    classes: BTreeMap<CharClass, BTreeSet<char>>,
}

impl CharacterClassSet {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            classes: CharClass::ALL
                .iter()
                .map(|class| (*class, BTreeSet::new()))
                .collect(),
        }
    }

    /// Classify and record every character of `text`
    pub fn observe(&mut self, text: &str) {
        for c in text.chars() {
            self.classes.entry(classify(c)).or_default().insert(c);
        }
    }

    /// Characters seen for a class, in codepoint order
    pub fn chars(&self, class: CharClass) -> impl Iterator<Item = char> + '_ {
        self.classes.get(&class).into_iter().flatten().copied()
    }

    /// Characters seen for a class, concatenated in codepoint order
    pub fn class_string(&self, class: CharClass) -> String {
        self.chars(class).collect()
    }

    /// True when no character was observed at all
    pub fn is_empty(&self) -> bool {
        self.classes.values().all(BTreeSet::is_empty)
    }
}

impl Serialize for CharacterClassSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(CharClass::ALL.len() + 1))?;
        map.serialize_entry("column", &self.column)?;
        for class in CharClass::ALL {
            map.serialize_entry(class.name(), &self.class_string(class))?;
        }
        map.end()
    }
}

/// Builds the character-class inventory of every column
#[derive(Debug, Default, Clone, Copy)]
pub struct CharacterProfiler;

impl CharacterProfiler {
    pub fn new() -> Self {
        Self
    }

    /// One [`CharacterClassSet`] per column, in column order
    pub fn records(
        &self,
        table: &Table,
        progress: &mut dyn ProgressObserver,
    ) -> Result<Vec<CharacterClassSet>> {
        ensure_table(table)?;

        let total = table.column_count();
        let mut records = Vec::with_capacity(total);

        for (idx, column) in table.columns.iter().enumerate() {
            progress.column_started(idx, total, &column.name);

            let mut set = CharacterClassSet::new(column.name.clone());
            for value in table.present_values(idx) {
                set.observe(&cell_text(value));
            }
            records.push(set);
        }
        progress.finished();

        Ok(records)
    }

    /// Profile a table into a new table: `column` followed by the nine class columns
    pub fn profile(&self, table: &Table, progress: &mut dyn ProgressObserver) -> Result<Table> {
        let records = self.records(table, progress)?;
        Ok(records_to_table(&records))
    }
}

/// Lay records out as a table with one row per profiled column
pub fn records_to_table(records: &[CharacterClassSet]) -> Table {
    let mut columns = vec![Column::new("column", 0)];
    columns.extend(
        CharClass::ALL
            .iter()
            .enumerate()
            .map(|(i, class)| Column::new(class.name(), i + 1)),
    );

    let mut table = Table::new(columns);
    for record in records {
        let mut cells = Vec::with_capacity(CharClass::ALL.len() + 1);
        cells.push(CellValue::from(record.column.clone()));
        cells.extend(
            CharClass::ALL
                .iter()
                .map(|class| CellValue::from(record.class_string(*class))),
        );
        table.push_row(cells);
    }
    table
}

/// Convenience function to profile characters without progress reporting
pub fn profile_characters(table: &Table) -> Result<Table> {
    CharacterProfiler::new().profile(table, &mut NoProgress)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_column(values: &[Option<&str>]) -> Table {
        let mut table = Table::with_column_names(&["col"]);
        for v in values {
            table.push_row(vec![CellValue::from(*v)]);
        }
        table
    }

    #[test]
    fn test_classify_each_class() {
        assert_eq!(classify('7'), CharClass::Numeric);
        assert_eq!(classify('q'), CharClass::LettersLowercase);
        assert_eq!(classify('Q'), CharClass::LettersUppercase);
        assert_eq!(classify(' '), CharClass::Whitespace);
        assert_eq!(classify('\t'), CharClass::Whitespace);
        assert_eq!(classify('\n'), CharClass::Whitespace);
        assert_eq!(classify('\r'), CharClass::Whitespace);
        assert_eq!(classify('{'), CharClass::BracketsQuotes);
        assert_eq!(classify('\''), CharClass::BracketsQuotes);
        assert_eq!(classify('?'), CharClass::Punctuation);
        assert_eq!(classify('%'), CharClass::Operators);
        assert_eq!(classify('@'), CharClass::OtherAscii);
        assert_eq!(classify('_'), CharClass::OtherAscii);
        assert_eq!(classify('\u{7f}'), CharClass::OtherAscii);
        assert_eq!(classify('é'), CharClass::OtherNonAscii);
        assert_eq!(classify('€'), CharClass::OtherNonAscii);
    }

    #[test]
    fn test_non_ascii_letters_and_digits_are_not_subclassified() {
        assert_eq!(classify('ж'), CharClass::OtherNonAscii);
        assert_eq!(classify('Ж'), CharClass::OtherNonAscii);
        assert_eq!(classify('٣'), CharClass::OtherNonAscii);
    }

    #[test]
    fn test_whitespace_wins_over_other_classes() {
        // Vertical tab and form feed are ASCII but classified as whitespace first
        assert_eq!(classify('\u{0b}'), CharClass::Whitespace);
        assert_eq!(classify('\u{0c}'), CharClass::Whitespace);
        assert_eq!(classify('\u{a0}'), CharClass::Whitespace);
    }

    #[test]
    fn test_ascii_separators_are_whitespace() {
        for c in '\u{1c}'..='\u{1f}' {
            assert_eq!(classify(c), CharClass::Whitespace, "{:?}", c);
        }
        assert_eq!(classify('\u{1b}'), CharClass::OtherAscii);
        assert_eq!(classify('\u{7f}'), CharClass::OtherAscii);
    }

    #[test]
    fn test_bool_column_reads_capitalized() {
        let mut table = Table::with_column_names(&["flag"]);
        table.push_row(vec![CellValue::Bool(true)]);
        table.push_row(vec![CellValue::Bool(false)]);
        table.push_row(vec![CellValue::Null]);

        let records = CharacterProfiler::new()
            .records(&table, &mut NoProgress)
            .unwrap();
        assert_eq!(records[0].class_string(CharClass::LettersUppercase), "FT");
        assert_eq!(records[0].class_string(CharClass::LettersLowercase), "aelrsu");
    }

    #[test]
    fn test_rules_follow_output_order() {
        let order: Vec<_> = RULES.iter().map(|(class, _)| *class).collect();
        assert_eq!(order, CharClass::ALL.to_vec());
    }

    #[test]
    fn test_mixed_column() {
        let table = single_column(&[Some("a1"), Some("B!"), Some("  ")]);
        let records = CharacterProfiler::new()
            .records(&table, &mut NoProgress)
            .unwrap();

        let set = &records[0];
        assert_eq!(set.class_string(CharClass::Numeric), "1");
        assert_eq!(set.class_string(CharClass::LettersLowercase), "a");
        assert_eq!(set.class_string(CharClass::LettersUppercase), "B");
        assert_eq!(set.class_string(CharClass::Punctuation), "!");
        assert_eq!(set.class_string(CharClass::Whitespace), " ");
        assert_eq!(set.class_string(CharClass::BracketsQuotes), "");
        assert_eq!(set.class_string(CharClass::Operators), "");
        assert_eq!(set.class_string(CharClass::OtherAscii), "");
        assert_eq!(set.class_string(CharClass::OtherNonAscii), "");
    }

    #[test]
    fn test_characters_sorted_and_deduplicated() {
        let table = single_column(&[Some("zyx"), Some("xyz"), Some("321"), Some("(a)")]);
        let records = CharacterProfiler::new()
            .records(&table, &mut NoProgress)
            .unwrap();

        assert_eq!(records[0].class_string(CharClass::LettersLowercase), "axyz");
        assert_eq!(records[0].class_string(CharClass::Numeric), "123");
        assert_eq!(records[0].class_string(CharClass::BracketsQuotes), "()");
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let table = single_column(&[None, None]);
        let records = CharacterProfiler::new()
            .records(&table, &mut NoProgress)
            .unwrap();

        assert!(records[0].is_empty());
        for class in CharClass::ALL {
            assert_eq!(records[0].class_string(class), "");
        }
    }

    #[test]
    fn test_numbers_are_rendered_before_scanning() {
        let mut table = Table::with_column_names(&["x"]);
        table.push_row(vec![CellValue::Float(-1.5)]);
        table.push_row(vec![CellValue::Float(f64::NAN)]);

        let records = CharacterProfiler::new()
            .records(&table, &mut NoProgress)
            .unwrap();
        assert_eq!(records[0].class_string(CharClass::Numeric), "15");
        assert_eq!(records[0].class_string(CharClass::Punctuation), ".");
        assert_eq!(records[0].class_string(CharClass::Operators), "-");
        assert_eq!(records[0].class_string(CharClass::LettersUppercase), "");
    }

    #[test]
    fn test_output_table_layout() {
        let mut table = Table::with_column_names(&["first", "second"]);
        table.push_row(vec![CellValue::from("ab"), CellValue::from("Ü")]);

        let out = profile_characters(&table).unwrap();
        let names: Vec<_> = out.column_names().collect();
        assert_eq!(
            names,
            vec![
                "column",
                "numeric",
                "letters_lowercase",
                "letters_uppercase",
                "whitespace",
                "brackets_quotes",
                "punctuation",
                "operators",
                "other_ascii",
                "other_non_ascii",
            ]
        );
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.value(0, "column"), Some(&CellValue::from("first")));
        assert_eq!(out.value(0, "letters_lowercase"), Some(&CellValue::from("ab")));
        assert_eq!(out.value(1, "other_non_ascii"), Some(&CellValue::from("Ü")));
        assert_eq!(out.value(1, "letters_uppercase"), Some(&CellValue::from("")));
    }

    #[test]
    fn test_serialize_record() {
        let mut set = CharacterClassSet::new("c");
        set.observe("b a");
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["column"], "c");
        assert_eq!(json["letters_lowercase"], "ab");
        assert_eq!(json["whitespace"], " ");
        assert_eq!(json["numeric"], "");
    }
}
