//! Prompt construction for SQL synthesis and answer composition.

/// Prompt for turning a sanitized question into a bare MySQL statement.
pub fn sql_synthesis_prompt(question: &str, schema: &str, result_limit: u32) -> String {
    format!(
        "You are a MySQL expert. Given a user question and the database schema, \
         create a syntactically correct MySQL query to retrieve the relevant data. \
         Use JOINs for related tables, avoid subqueries where possible, and limit \
         results to {result_limit} for performance. Return ONLY the SQL query as \
         plain text, without any Markdown, code blocks (```sql or ```), or \
         additional text.\n\n\
         User question: {question}\n\
         Database schema: {schema}\n\n\
         SQL Query:"
    )
}

/// Prompt for turning a query, its results and the conversation history into
/// a plain-English answer.
pub fn answer_prompt(statement: &str, results: &str, history: &str) -> String {
    format!(
        "You are a helpful assistant. Based on the SQL query, its results, and \
         the conversation history, provide a clear, concise response in plain \
         English. Avoid technical terms and format the response conversationally. \
         Use the history to maintain context for follow-up questions.\n\n\
         Conversation History: {history}\n\
         SQL Query: {statement}\n\
         Results: {results}\n\n\
         Response:"
    )
}
