//! Prompt construction.

/// Build the completion prompt for a user query.
///
/// The query is embedded verbatim; the worked examples anchor the model on a
/// single-line JSON object with `formula` and `explanation` keys.
pub fn build_prompt(query: &str) -> String {
    format!(
        r#"You are a Google Sheets formula expert. Convert this plain English request into a Google Sheets formula:

"{query}"

Respond with a JSON object containing:
- "formula": The exact Google Sheets formula (including = sign)
- "explanation": A brief explanation of what the formula does

Important:
- Do not include any extra text before or after the JSON object.
- The response should be a single-line JSON string.
- No Markdown formatting, no explanation outside the JSON.

Examples:
- "sum all values in column B where column C is greater than 50" → {{"formula": "=SUMIF(C:C,\">50\",B:B)", "explanation": "This formula sums all values in column B where the corresponding value in column C is greater than 50"}}
- "average of A1 to A10" → {{"formula": "=AVERAGE(A1:A10)", "explanation": "This formula calculates the average of cells A1 through A10"}}
- "count cells in column D that contain text" → {{"formula": "=COUNTA(D:D)", "explanation": "This formula counts all non-empty cells in column D"}}
"#
    )
}
