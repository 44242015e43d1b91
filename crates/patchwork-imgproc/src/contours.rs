use patchwork_image::Image;

/// Specification for Border Type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BorderType {
    /// Perimeter of foreground regions
    Outer,
    /// Perimeter of background regions enclosed by foreground.
    Hole,
}

/// A 2-dimensional integer pixel coordinate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    /// x-coordinate.
    pub x: i32,
    /// y-coordinate.
    pub y: i32,
}

impl Point {
    /// Construct a point at (x, y).
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// The border for any region.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// The points on the border, in tracing order.
    pub points: Vec<Point>,
    /// The type of the border. Outer or Hole.
    pub border_type: BorderType,
    /// Index of the enclosing border, `None` for borders on the image frame.
    pub parent: Option<usize>,
}

impl Contour {
    /// Area enclosed by the contour polygon, by the shoelace formula.
    ///
    /// Degenerate contours (a single pixel or a one pixel wide line) have zero area.
    pub fn area(&self) -> f64 {
        contour_area(&self.points)
    }
}

/// Area of the closed polygon through `points`.
///
/// # Example
///
/// ```
/// use patchwork_imgproc::contours::{contour_area, Point};
///
/// let square = [
///     Point::new(0, 0),
///     Point::new(0, 4),
///     Point::new(4, 4),
///     Point::new(4, 0),
/// ];
/// assert_eq!(contour_area(&square), 16.0);
/// ```
pub fn contour_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64)
        .sum();

    twice_area.abs() as f64 / 2.0
}

// Neighbor offsets in clockwise order (image y axis points down): E, SE, S, SW, W, NW, N, NE.
const DIRECTIONS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

fn direction_index(dx: isize, dy: isize) -> usize {
    DIRECTIONS
        .iter()
        .position(|&d| d == (dx, dy))
        .unwrap_or(0)
}

/// Finds the borders of the foreground regions of the image.
///
/// All pixels with intensity greater than `threshold` are treated as belonging
/// to the foreground. Pixels outside the image are background, so regions
/// touching the image edge are closed along it.
///
/// Code written based on algorithm proposed by Suzuki and Abe for border following.
///
/// # Arguments
///
/// * `src` - A reference to the source grayscale image.
/// * `threshold` - The threshold for treating a pixel as a foreground pixel.
///
/// # Returns
///
/// All the `Contour`s found in the input image, in raster discovery order.
pub fn find_contours(src: &Image<u8, 1>, threshold: u8) -> Vec<Contour> {
    let width = src.width();
    let height = src.height();
    let mut contours: Vec<Contour> = Vec::new();
    if width == 0 || height == 0 {
        return contours;
    }

    // one pixel of background padding around the image
    let stride = width + 2;
    let mut labels = vec![0i32; stride * (height + 2)];
    let at = |x: usize, y: usize| x + y * stride;

    for (y, row) in src.as_slice().chunks_exact(width).enumerate() {
        for (x, &value) in row.iter().enumerate() {
            if value > threshold {
                labels[at(x + 1, y + 1)] = 1;
            }
        }
    }

    let neighbor = |x: usize, y: usize, d: usize| -> (usize, usize) {
        let (dx, dy) = DIRECTIONS[d % 8];
        ((x as isize + dx) as usize, (y as isize + dy) as usize)
    };

    // the image frame has label 1 and behaves like a hole border
    let border_kind = |contours: &[Contour], label: i32| -> (BorderType, Option<usize>) {
        if label <= 1 {
            (BorderType::Hole, None)
        } else {
            let idx = (label - 2) as usize;
            (contours[idx].border_type, Some(idx))
        }
    };

    let mut nbd = 1i32;

    for y in 1..=height {
        let mut lnbd = 1i32;

        for x in 1..=width {
            let value = labels[at(x, y)];
            if value == 0 {
                continue;
            }

            let start = if value == 1 && labels[at(x - 1, y)] == 0 {
                Some(((x - 1, y), BorderType::Outer))
            } else if value >= 1 && labels[at(x + 1, y)] == 0 {
                if value > 1 {
                    lnbd = value;
                }
                Some(((x + 1, y), BorderType::Hole))
            } else {
                None
            };

            if let Some(((x2, y2), border_type)) = start {
                nbd += 1;

                let (prev_type, prev_idx) = border_kind(&contours, lnbd);
                let parent = if border_type == prev_type {
                    prev_idx.and_then(|idx| contours[idx].parent)
                } else {
                    prev_idx
                };

                let mut points = Vec::new();
                let d0 = direction_index(x2 as isize - x as isize, y2 as isize - y as isize);

                // clockwise search for the first foreground neighbor
                let first = (0..8)
                    .map(|k| neighbor(x, y, d0 + k))
                    .find(|&(nx, ny)| labels[at(nx, ny)] != 0);

                match first {
                    None => {
                        points.push(Point::new(x as i32 - 1, y as i32 - 1));
                        labels[at(x, y)] = -nbd;
                    }
                    Some(p1) => {
                        let mut p2 = p1;
                        let mut p3 = (x, y);

                        loop {
                            points.push(Point::new(p3.0 as i32 - 1, p3.1 as i32 - 1));

                            // counter-clockwise search starting after p2
                            let d = direction_index(
                                p2.0 as isize - p3.0 as isize,
                                p2.1 as isize - p3.1 as isize,
                            );
                            let mut east_is_background = false;
                            let mut p4 = p3;
                            for k in 1..=8 {
                                let nd = (d + 8 - k) % 8;
                                let (nx, ny) = neighbor(p3.0, p3.1, nd);
                                if labels[at(nx, ny)] != 0 {
                                    p4 = (nx, ny);
                                    break;
                                }
                                if nd == 0 {
                                    east_is_background = true;
                                }
                            }

                            let idx3 = at(p3.0, p3.1);
                            if east_is_background {
                                labels[idx3] = -nbd;
                            } else if labels[idx3] == 1 {
                                labels[idx3] = nbd;
                            }

                            if p4 == (x, y) && p3 == p1 {
                                break;
                            }
                            p2 = p3;
                            p3 = p4;
                        }
                    }
                }

                contours.push(Contour {
                    points,
                    border_type,
                    parent,
                });
            }

            let value = labels[at(x, y)];
            if value != 1 {
                lnbd = value.abs();
            }
        }
    }

    contours
}

/// Find only the outermost borders of the foreground regions.
///
/// Regions nested inside holes of other regions are not reported.
pub fn find_external_contours(src: &Image<u8, 1>, threshold: u8) -> Vec<Contour> {
    find_contours(src, threshold)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .collect()
}
