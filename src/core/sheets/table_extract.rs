use crate::core::html::model::Block;

/// Pulls the first table out of the parsed document as a grid of trimmed
/// cell strings. Ragged rows are kept as-is; the grid is not forced
/// rectangular.
pub fn first_table_grid(blocks: &[Block]) -> Option<Vec<Vec<String>>> {
    blocks.iter().find_map(|block| match block {
        Block::Table(rows) => Some(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.trim().to_string()).collect())
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::html::model::Run;

    fn table(rows: &[&[&str]]) -> Block {
        Block::Table(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn finds_the_first_table_past_other_blocks() {
        let blocks = vec![
            Block::Paragraph(vec![Run {
                text: "intro".to_string(),
                bold: false,
            }]),
            table(&[&["Name", "Count"], &["a", "1"]]),
            table(&[&["second"]]),
        ];
        assert_eq!(
            first_table_grid(&blocks),
            Some(vec![
                vec!["Name".to_string(), "Count".to_string()],
                vec!["a".to_string(), "1".to_string()],
            ])
        );
    }

    #[test]
    fn trims_cell_text() {
        let blocks = vec![table(&[&["  padded  ", "\nvalue\n"]])];
        assert_eq!(
            first_table_grid(&blocks),
            Some(vec![vec!["padded".to_string(), "value".to_string()]])
        );
    }

    #[test]
    fn ragged_rows_are_preserved() {
        let blocks = vec![table(&[&["a", "b", "c"], &["d"]])];
        let grid = first_table_grid(&blocks).unwrap();
        assert_eq!(grid[0].len(), 3);
        assert_eq!(grid[1].len(), 1);
    }

    #[test]
    fn no_table_yields_none() {
        let blocks = vec![Block::Heading {
            level: 2,
            text: "just a heading".to_string(),
        }];
        assert_eq!(first_table_grid(&blocks), None);
    }
}
