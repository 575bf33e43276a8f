mod tests_lexer;
