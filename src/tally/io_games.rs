// Readers for the list of games.

use calamine::DataType;

use crate::tally::*;

type Table = (Vec<String>, Vec<Vec<String>>);

pub fn read_games(path: &str, worksheet: &Option<String>, debug: bool) -> TallyResult<Registry> {
    info!("Attempting to read games file {:?}", path);
    let (header, rows) = if is_excel(path) {
        read_games_excel(path, worksheet)?
    } else {
        read_games_tsv(path)?
    };
    debug!("read_games: header: {:?}, {} rows", header, rows.len());
    let registry = Registry::from_rows(&header, &rows, debug).context(InvalidGamesSnafu { path })?;
    info!(
        "Games: {} canonical titles, {} match keys, {} rollover points",
        registry.allowed_titles().len(),
        registry.lookup().len(),
        registry.rollover_total()
    );
    Ok(registry)
}

fn is_excel(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false)
}

fn read_games_tsv(path: &str) -> TallyResult<Table> {
    let rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(OpeningGamesSnafu { path })?;
    let mut records = rdr.into_records();
    let header: Vec<String> = match records.next() {
        Some(line_r) => line_r
            .context(GamesLineParseSnafu { path, lineno: 1_usize })?
            .iter()
            .map(|s| s.to_string())
            .collect(),
        None => Vec::new(),
    };
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + 2;
        let line = line_r.context(GamesLineParseSnafu { path, lineno })?;
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    Ok((header, rows))
}

fn read_games_excel(path: &str, worksheet: &Option<String>) -> TallyResult<Table> {
    debug!("read_games_excel: path: {:?} worksheet: {:?}", path, worksheet);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu {
                path,
                worksheet: name.clone(),
            })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };

    let mut iter = wrange.rows();
    let header: Vec<String> = match iter.next() {
        Some(row) => row.iter().map(read_cell).collect(),
        None => Vec::new(),
    };
    let rows: Vec<Vec<String>> = iter.map(|row| row.iter().map(read_cell).collect()).collect();
    Ok((header, rows))
}

// Whole and within the range of i64, so that the cast is exact.
fn is_whole(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

fn read_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        // Numbers typed in a sheet come back as floats.
        DataType::Float(f) if is_whole(*f) => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        _ => {
            warn!("read_cell: could not understand cell {:?}, using an empty value", cell);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> String {
        let p = std::env::temp_dir().join(format!("tallyvotes-{}-{}", std::process::id(), name));
        fs::write(&p, content).unwrap();
        p.display().to_string()
    }

    #[test]
    fn tsv_games() {
        let path = write_temp(
            "games.tsv",
            "\u{feff}game\talias1\talias2\troll_over_points\n\
             The Great Game\tTGG\t\t2\n\
             Hades\n\
             \n\
             # Retired\tR\n\
             Ico\t\tICO!\tlots\n",
        );
        let registry = read_games(&path, &None, true).unwrap();
        assert_eq!(registry.allowed_titles().len(), 3);
        assert_eq!(registry.resolve("tgg"), Some("The Great Game"));
        assert_eq!(registry.resolve("great game"), Some("The Great Game"));
        assert_eq!(registry.resolve("hades"), Some("Hades"));
        assert_eq!(registry.resolve("ICO"), Some("Ico"));
        assert_eq!(registry.resolve("R"), None);
        assert_eq!(registry.seeds().get("The Great Game"), Some(&2));
        assert_eq!(registry.rollover_total(), 2);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_game_column() {
        let path = write_temp("no_game.tsv", "title\talias1\nHades\tH\n");
        let res = read_games(&path, &None, false);
        assert!(matches!(res, Err(TallyError::InvalidGames { .. })));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file() {
        let res = read_games("/this/file/does/not/exist.tsv", &None, false);
        assert!(matches!(res, Err(TallyError::OpeningGames { .. })));
    }

    #[test]
    fn excel_extension() {
        assert!(is_excel("games.xlsx"));
        assert!(is_excel("dir/GAMES.XLSX"));
        assert!(!is_excel("games.csv"));
        assert!(!is_excel("xlsx"));
    }

    #[test]
    fn cells() {
        assert_eq!(read_cell(&DataType::Float(3.0)), "3");
        assert_eq!(read_cell(&DataType::Int(4)), "4");
        assert_eq!(read_cell(&DataType::String("Hades".to_string())), "Hades");
        assert_eq!(read_cell(&DataType::Empty), "");
    }

    #[test]
    fn float_cells_out_of_range() {
        assert_eq!(read_cell(&DataType::Float(-2.0)), "-2");
        assert_eq!(read_cell(&DataType::Float(2.5)), "2.5");
        assert_eq!(read_cell(&DataType::Float(1e20)), "100000000000000000000");
        assert_eq!(read_cell(&DataType::Float(f64::NAN)), "NaN");
        assert_eq!(read_cell(&DataType::Float(f64::INFINITY)), "inf");
        // None of these is read as rollover points.
        let header = vec!["game".to_string(), "roll_over_points".to_string()];
        let rows: Vec<Vec<String>> = [1e20, f64::NAN, 2.5]
            .iter()
            .enumerate()
            .map(|(i, f)| vec![format!("Game {}", i), read_cell(&DataType::Float(*f))])
            .collect();
        let registry = Registry::from_rows(&header, &rows, false).unwrap();
        assert_eq!(registry.rollover_total(), 0);
    }
}
