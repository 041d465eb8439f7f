mod infrastructure;
