mod helpers;
mod mention_flow;
mod threading;
