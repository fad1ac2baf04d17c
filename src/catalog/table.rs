//! First-table extraction for Apache-style directory listings

use crate::error::CatalogError;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// A `<td>` reduced to what the resolvers read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Trimmed text content
    pub text: String,
    /// Raw `href` of the first link inside the cell
    pub link: Option<String>,
}

/// A `<tr>` reduced to its data cells (`<th>` cells are not collected)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// Cell at a zero-based position
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Header and separator rows carry no `<td>`
    pub fn is_data_row(&self) -> bool {
        !self.cells.is_empty()
    }
}

/// Parse `markup` and return every row of its first table in document order.
///
/// `page` only labels errors.
pub fn first_table_rows(markup: &str, page: &str) -> Result<Vec<Row>, CatalogError> {
    let document = Html::parse_document(markup);
    let table = document
        .select(&TABLE)
        .next()
        .ok_or_else(|| CatalogError::table_not_found(page))?;

    Ok(table.select(&ROW).map(read_row).collect())
}

fn read_row(row: ElementRef<'_>) -> Row {
    let cells = row
        .select(&CELL)
        .map(|cell| Cell {
            text: cell.text().collect::<String>().trim().to_string(),
            link: cell
                .select(&LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string),
        })
        .collect();
    Row { cells }
}
