pub mod temporal_knapsack;
