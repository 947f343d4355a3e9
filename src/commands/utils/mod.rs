pub mod help_table;
