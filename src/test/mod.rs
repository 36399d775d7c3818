mod portfolio;
mod replay;
