mod command;
mod schedule;
