//! Static schema description used as prompt context.
//!
//! The text is never parsed structurally; it exists only to ground SQL
//! synthesis. Immutable for the process lifetime. A deployment against a
//! different database swaps it via the `SCHEMA_FILE` setting.

/// The school database schema: tables, columns, types, keys, nullability
/// and foreign-key relations.
pub const SCHEMA_DESCRIPTION: &str = "\
Table: students
- roll_no: INT, PRIMARY KEY
- first_name: VARCHAR(100), NOT NULL
- last_name: VARCHAR(100), NOT NULL
- age: TINYINT UNSIGNED, NOT NULL
- class_id: INT, FOREIGN KEY to classes(class_id)
- section_id: INT, FOREIGN KEY to sections(section_id)
- scholarship_id: INT, FOREIGN KEY to scholarships(scholarship_id), NULLABLE
- bank_account_id: INT, FOREIGN KEY to bankdetails(bank_account_id), NULLABLE

Table: parents
- parent_id: INT, PRIMARY KEY
- student_roll_no: INT, FOREIGN KEY to students(roll_no)
- parent_name: VARCHAR(200), NOT NULL
- relation: VARCHAR(50), NOT NULL

Table: subjects
- subject_id: INT, PRIMARY KEY
- subject_name: VARCHAR(100), NOT NULL

Table: scholarships
- scholarship_id: INT, PRIMARY KEY
- scholarship_name: VARCHAR(100), NOT NULL
- amount: DECIMAL(10,2), NOT NULL

Table: marks
- mark_id: INT, PRIMARY KEY
- student_roll_no: INT, FOREIGN KEY to students(roll_no)
- subject_id: INT, FOREIGN KEY to subjects(subject_id)
- marks_obtained: DECIMAL(5,2), NOT NULL

Table: bankdetails
- bank_account_id: INT, PRIMARY KEY
- student_roll_no: INT, FOREIGN KEY to students(roll_no)
- bank_name: VARCHAR(100), NOT NULL
- account_number: VARCHAR(30), NOT NULL
- ifsc_code: VARCHAR(20), NOT NULL

Table: classes
- class_id: INT, PRIMARY KEY
- class_name: VARCHAR(50), NOT NULL
- section_id: INT, FOREIGN KEY to sections(section_id)

Table: sections
- section_id: INT, PRIMARY KEY
- section_name: CHAR(1), NOT NULL
";
