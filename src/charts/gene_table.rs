//! Mutated-gene and copy-number-gene tables. Row clicks toggle the gene key in the filter list.

use crate::model::{CnaGeneRow, MutatedGeneRow};
use crate::selection::{filter_values, toggle_value};
use crate::vector::VectorDocument;

use super::clinical_table::{draw_table, TableRow, TableStyle};
use super::{Interaction, Plottable, RenderContext, SelectionEvent};

fn percent(frequency: f64) -> String {
    format!("{:.1}%", frequency)
}

#[derive(Debug, Clone, PartialEq)]
struct GeneRows {
    keys: Vec<String>,
    rows: Vec<TableRow>,
    filter_values: Vec<String>,
    size: (f64, f64),
    style: TableStyle,
}

impl GeneRows {
    fn new(keyed: Vec<(String, Vec<String>)>, ctx: &RenderContext<'_>) -> Self {
        let filter_values = filter_values(ctx.filters);
        let (keys, rows) = keyed
            .into_iter()
            .map(|(key, cells)| {
                let selected = filter_values.contains(&key);
                (
                    key,
                    TableRow {
                        cells,
                        swatch: None,
                        selected,
                    },
                )
            })
            .unzip();
        Self {
            keys,
            rows,
            filter_values,
            size: (ctx.size.0 as f64, ctx.size.1 as f64),
            style: TableStyle::from_ctx(ctx),
        }
    }

    fn on_interaction(&self, interaction: &Interaction) -> Option<SelectionEvent> {
        match *interaction {
            Interaction::Click { index } => self
                .keys
                .get(index)
                .map(|key| SelectionEvent::Values(toggle_value(&self.filter_values, key))),
            Interaction::Drag { .. } => None,
        }
    }

    fn draw(&self, headers: &[&str]) -> VectorDocument {
        draw_table(self.size, headers, &self.rows, &self.style)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutatedGenesTable(GeneRows);

impl MutatedGenesTable {
    pub fn new(rows: &[MutatedGeneRow], ctx: &RenderContext<'_>) -> Self {
        let keyed = rows
            .iter()
            .map(|r| {
                (
                    r.entrez_gene_id.to_string(),
                    vec![
                        r.hugo_gene_symbol.clone(),
                        r.total_count.to_string(),
                        r.count_by_entity.to_string(),
                        percent(r.frequency),
                    ],
                )
            })
            .collect();
        Self(GeneRows::new(keyed, ctx))
    }

    pub fn on_interaction(&self, interaction: &Interaction) -> Option<SelectionEvent> {
        self.0.on_interaction(interaction)
    }
}

impl Plottable for MutatedGenesTable {
    fn to_vector_document(&self) -> VectorDocument {
        self.0.draw(&["Gene", "# Mut", "#", "Freq"])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CnaGenesTable(GeneRows);

impl CnaGenesTable {
    pub fn new(rows: &[CnaGeneRow], ctx: &RenderContext<'_>) -> Self {
        let keyed = rows
            .iter()
            .map(|r| {
                (
                    r.filter_key(),
                    vec![
                        r.hugo_gene_symbol.clone(),
                        r.cytoband.clone(),
                        r.alteration_label().to_string(),
                        r.count_by_entity.to_string(),
                        percent(r.frequency),
                    ],
                )
            })
            .collect();
        Self(GeneRows::new(keyed, ctx))
    }

    pub fn on_interaction(&self, interaction: &Interaction) -> Option<SelectionEvent> {
        self.0.on_interaction(interaction)
    }
}

impl Plottable for CnaGenesTable {
    fn to_vector_document(&self) -> VectorDocument {
        self.0.draw(&["Gene", "Cytoband", "CNA", "#", "Freq"])
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::model::ActiveFilter;

    #[test]
    fn mutated_gene_click_toggles_entrez_id() {
        let fx = Fixture::new();
        let rows = vec![MutatedGeneRow {
            entrez_gene_id: 7157,
            hugo_gene_symbol: "TP53".into(),
            count_by_entity: 40,
            total_count: 52,
            frequency: 40.0,
        }];
        let table = MutatedGenesTable::new(&rows, &fx.ctx(&[]));
        assert_eq!(
            table.on_interaction(&Interaction::Click { index: 0 }),
            Some(SelectionEvent::Values(vec!["7157".into()]))
        );
        let texts: Vec<String> = table
            .to_vector_document()
            .texts()
            .map(str::to_string)
            .collect();
        assert!(texts.contains(&"TP53".to_string()));
        assert!(texts.contains(&"40.0%".to_string()));
    }

    #[test]
    fn cna_gene_keys_include_alteration() {
        let fx = Fixture::new();
        let rows = vec![CnaGeneRow {
            entrez_gene_id: 1956,
            hugo_gene_symbol: "EGFR".into(),
            alteration: 2,
            cytoband: "7p11.2".into(),
            count_by_entity: 5,
            frequency: 5.0,
        }];
        let filters = [ActiveFilter::value("1956:2")];
        let table = CnaGenesTable::new(&rows, &fx.ctx(&filters));
        assert_eq!(
            table.on_interaction(&Interaction::Click { index: 0 }),
            Some(SelectionEvent::Values(vec![]))
        );
        let doc = table.to_vector_document();
        assert!(doc.texts().any(|t| t == "AMP"));
    }
}
