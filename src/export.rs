use std::io::Write;

use crate::allocation::Assignment;
use crate::draw::DrawnEvent;
use crate::error::{LotteryError, Result};
use crate::simulation::OddsTable;

/// Heading on the first page of the draft order document
pub const DRAFT_ORDER_TITLE: &str = "Fantasy Draft Lottery - Draft Order";

/// Pick lines fitting under the title on an A4 page
pub const FIRST_PAGE_LINES: usize = 40;

/// Pick lines fitting on a continuation page
pub const PAGE_LINES: usize = 42;

/// Write the assignment table as `Combination,Team` rows.
pub fn write_assignment<W: Write>(assignment: &Assignment, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in assignment.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write drawn events as `Combination,Team,Original_Tickets,Pick` rows.
pub fn write_events<W: Write>(events: &[DrawnEvent], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for event in events {
        wtr.serialize(event)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write simulated odds with one row per team and one column per pick.
pub fn write_odds<W: Write>(odds: &OddsTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Team".to_string()];
    header.extend((1..=odds.picks()).map(|pick| format!("Pick {}", pick)));
    wtr.write_record(&header)?;

    for team in odds.teams() {
        let mut record = vec![team.clone()];
        if let Some(row) = odds.row(team) {
            record.extend(row.iter().map(|p| p.to_string()));
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn to_string_with<F>(write: F) -> Result<String>
where
    F: FnOnce(&mut Vec<u8>) -> Result<()>,
{
    let mut buf = Vec::new();
    write(&mut buf)?;
    String::from_utf8(buf).map_err(|e| LotteryError::Export(e.to_string()))
}

pub fn assignment_csv(assignment: &Assignment) -> Result<String> {
    to_string_with(|buf| write_assignment(assignment, buf))
}

pub fn events_csv(events: &[DrawnEvent]) -> Result<String> {
    to_string_with(|buf| write_events(events, buf))
}

pub fn odds_csv(odds: &OddsTable) -> Result<String> {
    to_string_with(|buf| write_odds(odds, buf))
}

/// Lay out the draft order as pages of numbered lines.
///
/// The first page starts with the title; later pages carry only picks.
pub fn draft_order_pages(draft_order: &[&str]) -> Vec<Vec<String>> {
    let mut pages = vec![vec![DRAFT_ORDER_TITLE.to_string()]];
    let mut room = FIRST_PAGE_LINES;

    for (idx, team) in draft_order.iter().enumerate() {
        if room == 0 {
            pages.push(Vec::new());
            room = PAGE_LINES;
        }
        if let Some(page) = pages.last_mut() {
            page.push(format!("{}. {}", idx + 1, team));
        }
        room -= 1;
    }

    pages
}

/// Draft order pages joined into one document, separated by form feeds.
pub fn draft_order_document(draft_order: &[&str]) -> String {
    draft_order_pages(draft_order)
        .iter()
        .map(|page| page.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\x0c\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::allocate_seeded;
    use crate::draw::LotteryRound;
    use crate::simulation::estimate_seeded;
    use crate::team::Team;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn make_teams() -> Vec<Team> {
        vec![Team::new("A".to_string(), 600), Team::new("B".to_string(), 400)]
    }

    #[test]
    fn test_assignment_csv() {
        let assignment = allocate_seeded(&make_teams(), Some(1)).unwrap();
        let csv = assignment_csv(&assignment).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Combination,Team");
        assert_eq!(lines.len(), 1001);
        assert_eq!(lines.iter().filter(|l| l.ends_with(",A")).count(), 600);
    }

    #[test]
    fn test_events_csv() {
        let mut round = LotteryRound::new(allocate_seeded(&make_teams(), Some(2)).unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let first = round.resolve_random(&mut rng).unwrap();

        let csv = events_csv(round.events()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Combination,Team,Original_Tickets,Pick");
        assert_eq!(
            lines[1],
            format!("{},{},{},1", first.combination, first.team, first.original_tickets)
        );
    }

    #[test]
    fn test_odds_csv() {
        let odds = estimate_seeded(&make_teams(), 1_000, Some(3)).unwrap();
        let csv = odds_csv(&odds).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Team,Pick 1,Pick 2");
        assert!(lines[1].starts_with("A,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_draft_order_pages() {
        let names: Vec<String> = (1..=100).map(|i| format!("Team{}", i)).collect();
        let order: Vec<&str> = names.iter().map(String::as_str).collect();
        let pages = draft_order_pages(&order);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0][0], DRAFT_ORDER_TITLE);
        assert_eq!(pages[0].len(), FIRST_PAGE_LINES + 1);
        assert_eq!(pages[1].len(), PAGE_LINES);
        assert_eq!(pages[1][0], "41. Team41");
        assert_eq!(pages[2].len(), 100 - FIRST_PAGE_LINES - PAGE_LINES);
    }

    #[test]
    fn test_draft_order_document() {
        assert_eq!(draft_order_document(&[]), DRAFT_ORDER_TITLE);
        assert_eq!(
            draft_order_document(&["C", "A"]),
            format!("{}\n1. C\n2. A", DRAFT_ORDER_TITLE)
        );
    }
}
