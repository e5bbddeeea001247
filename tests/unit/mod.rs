mod authorization;
mod notifications;
mod requests;
