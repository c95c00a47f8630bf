use crate::cleast::Cleast;
use crate::edge::Edge;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[derive(Tabled)]
pub struct StatementRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Identifier")]
    pub identifier: String,
    #[tabled(rename = "Span")]
    pub span: String,
    #[tabled(rename = "Section")]
    pub section: String,
    #[tabled(rename = "Safe")]
    pub safe: String,
    #[tabled(rename = "Comment")]
    pub comment: String,
}

/// One row per local statement
pub fn statement_table(cleast: &Cleast) -> String {
    let rows: Vec<StatementRow> = cleast
        .statements_of_kind(None, true)
        .into_iter()
        .map(|s| StatementRow {
            index: s.index,
            kind: s.kind.to_string(),
            identifier: s.qualified_identifier(),
            span: s.span.to_string(),
            section: s.section.clone().unwrap_or_default(),
            safe: match cleast.diagnostic(s.index) {
                None => "yes".to_string(),
                Some(d) => format!("no ({})", d.variables.join(", ")),
            },
            comment: cleast
                .comments_of(s.index)
                .first()
                .map(|c| c.content.lines().next().unwrap_or_default().to_string())
                .unwrap_or_default(),
        })
        .collect();
    if rows.is_empty() {
        return String::new();
    }
    Table::new(&rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
pub struct EdgeRow {
    #[tabled(rename = "Statement")]
    pub statement: usize,
    #[tabled(rename = "Edge")]
    pub kind: String,
    #[tabled(rename = "Predicate")]
    pub predicate: String,
}

pub fn edge_table<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> String {
    let rows: Vec<EdgeRow> = edges
        .into_iter()
        .map(|e| EdgeRow {
            statement: e.statement,
            kind: if e.negative { format!("{} (not)", e.kind) } else { e.kind.to_string() },
            predicate: e.predicate.to_string(),
        })
        .collect();
    if rows.is_empty() {
        return String::new();
    }
    Table::new(&rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{RawNode, Sign};

    #[test]
    fn test_stats_table() {
        let table = stats_table(&[("Statements", "3"), ("Unsafe", "1")]);
        assert!(table.contains("Metric"));
        assert!(table.contains("Statements"));
        assert!(stats_table(&[]).is_empty());
    }

    #[test]
    fn test_statement_and_edge_tables() {
        let x = || RawNode::variable("X");
        let rule = RawNode::rule(
            RawNode::atom(Sign::NoSign, "p", vec![x()]),
            vec![RawNode::atom(Sign::Negation, "q", vec![x()])],
        );
        let cleast = Cleast::new(vec![rule], Vec::new(), "test.lp", ".").unwrap();

        let statements = statement_table(&cleast);
        assert!(statements.contains("test.p/1"));
        assert!(statements.contains("no (X)"));
        assert!(statements.contains("Section"));

        let edges = edge_table(cleast.dependency_graph().edges());
        assert!(edges.contains("uses (not)"));
        assert!(edges.contains("q/1"));
    }
}
