//! Sudoku solve request payload checks.
//!
//! The payload is a JSON object carrying the zone geometry and the initial
//! board. Solver specific tuning fields are allowed and left untouched.
//!
//! ```json
//! { "zone_height": 2, "zone_length": 2, "board": [[1, 0, 0, 0], ...] }
//! ```

use serde_json::{Map, Value};

use super::Verdict;

/// Check a raw request body.
pub fn check_body(body: &[u8]) -> Verdict {
    if body.is_empty() {
        return Verdict::fail("Body Not Found");
    }

    let payload: Value = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(_) => return Verdict::fail("Body Is Not Valid JSON"),
    };

    let object = match payload.as_object() {
        Some(object) => object,
        None => return Verdict::fail("Body Must Be A JSON Object"),
    };

    let zone_height = match positive_integer(object, "zone_height") {
        Ok(value) => value,
        Err(verdict) => return verdict,
    };
    let zone_length = match positive_integer(object, "zone_length") {
        Ok(value) => value,
        Err(verdict) => return verdict,
    };

    let side = match zone_height.checked_mul(zone_length) {
        Some(side) => side,
        None => return Verdict::fail("Zone Size Too Large"),
    };

    check_board(object.get("board"), side)
}

fn positive_integer(object: &Map<String, Value>, field: &str) -> Result<u64, Verdict> {
    match object.get(field) {
        None => Err(Verdict::fail(format!("Body {field} Not Found"))),
        Some(value) => match value.as_u64() {
            Some(n) if n > 0 => Ok(n),
            _ => Err(Verdict::fail(format!("Body {field} Must Be A Positive Integer"))),
        },
    }
}

fn check_board(board: Option<&Value>, side: u64) -> Verdict {
    let rows = match board {
        None => return Verdict::fail("Body board Not Found"),
        Some(Value::Array(rows)) => rows,
        Some(_) => return Verdict::fail("Body board Must Be An Array"),
    };

    if rows.len() as u64 != side {
        return Verdict::fail(format!("Body board Must Have {side} Rows"));
    }

    for (row_index, row) in rows.iter().enumerate() {
        let cells = match row.as_array() {
            Some(cells) if cells.len() as u64 == side => cells,
            _ => return Verdict::fail(format!("Body board Row {row_index} Must Have {side} Cells")),
        };

        let out_of_range = cells
            .iter()
            .any(|cell| cell.as_u64().map_or(true, |value| value > side));
        if out_of_range {
            return Verdict::fail(format!(
                "Body board Row {row_index} Must Only Contain Integers Between 0 And {side}"
            ));
        }
    }

    Verdict::pass()
}
