mod controls;
mod details;
mod fps;
mod panels;
mod table;
