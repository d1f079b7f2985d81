//! Sequential ramps (one progression from low to high).
//!
//! These are the built-in ramps the registry falls back on when the catalog
//! does not carry a category's preferred palette.

/// Five-stop viridis-like ramp. Returned when a colormap name cannot be resolved.
pub const VIRIDIS: &[[u8; 3]] = &[
    [68, 1, 84],    // #440154
    [59, 82, 139],  // #3b528b
    [33, 145, 140], // #21918c
    [94, 201, 98],  // #5ec962
    [253, 231, 37], // #fde725
];

/// Ramp used for the `"dataset-default"` colormap name.
pub const DATASET_DEFAULT: &[[u8; 3]] = &[
    [49, 54, 149],   // #313695
    [116, 173, 209], // #74add1
    [255, 255, 191], // #ffffbf
    [244, 109, 67],  // #f46d43
    [165, 0, 38],    // #a50026
];

/// Dark blue through purple to yellow; ocean temperatures.
pub const THERMAL: &[[u8; 3]] = &[
    [4, 35, 51],
    [19, 48, 109],
    [64, 56, 145],
    [107, 69, 150],
    [144, 84, 139],
    [184, 98, 125],
    [222, 112, 101],
    [246, 143, 70],
    [248, 184, 60],
    [232, 250, 91],
];

/// Pale to deep blue; accumulated precipitation.
pub const RAIN: &[[u8; 3]] = &[
    [238, 237, 233],
    [210, 212, 194],
    [169, 194, 159],
    [127, 176, 143],
    [84, 153, 139],
    [53, 129, 138],
    [37, 104, 138],
    [37, 77, 131],
    [43, 50, 104],
    [34, 26, 60],
];

/// Cream through green; wind speed.
pub const SPEED: &[[u8; 3]] = &[
    [255, 253, 205],
    [225, 205, 115],
    [170, 172, 32],
    [95, 146, 12],
    [24, 115, 40],
    [20, 77, 42],
    [23, 35, 19],
];

/// Navy through teal to pale yellow; moisture fields.
pub const HALINE: &[[u8; 3]] = &[
    [42, 24, 108],
    [20, 67, 156],
    [32, 110, 139],
    [60, 147, 135],
    [90, 185, 120],
    [170, 216, 92],
    [253, 239, 154],
];
