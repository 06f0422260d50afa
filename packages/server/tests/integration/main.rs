mod auth;
mod media;
mod pages;
