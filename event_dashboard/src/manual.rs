/*!

This is the long-form manual for `event_dashboard` and `ebre_events`.

## Input

The input is the spreadsheet of activities, published as CSV (or as an xlsx
workbook). The first row holds the column names. The columns are matched by
their exact name, accents and punctuation included. Unknown columns are
ignored and missing ones read as empty.

| column                  | used for                                       |
|-------------------------|------------------------------------------------|
| `Nom`                   | required for the map rows                      |
| `Tipus`                 | only the `Esdeveniments` rows are kept         |
| `Localització`          | municipality of the marker                     |
| `Nom entitat promotora` | comma-separated promoter entities              |
| `Presidents`, `Període` | entries of the president filter                |
| `Latitud`, `Longitud`   | marker position, decimal comma allowed         |
| `Any inici`             | 4 digits, required for the charts              |
| `Mes inici`             | 1 or 2 digits, required for the charts         |
| `Tipus d'esdeveniment`  | event type chart, `Sense especificar` if blank |
| `CERE`                  | role of the organisation in the event          |

All the names can be changed with the `columns` section of the configuration.

## Rows that are skipped

A row that cannot be used for a view is left out of that view and the
processing continues:
* map rows: no name, no coordinates, coordinates that do not start with a finite number (text after the number is ignored), no municipality,
* chart rows: a year that is not 4 digits or a month that is not 1 or 2 digits,
* monthly chart: a month outside 1 to 12.

These rows are reported in the debug logs (`--verbose`).

## Municipalities

Municipalities are grouped by name, ignoring case, accents and repeated
spaces: `Móra d'Ebre`, `MORA D'EBRE ` and `mora  d'ebre` are the same marker.
The marker takes the spelling and the coordinates of the first row found.

Promoter entities, on the contrary, are counted as written.

## President filter

With the default `presidentPeriod` variant, an entry of the filter is a
president together with a period (`Anna|2010-2014`), and rows without a
period cannot be selected. With the `presidentOnly` variant, an entry is a
president only, and the yearly chart is not split by role.

The value `Tots` selects all the rows.

## Roles

In the yearly chart, an event counts for `impulsor` if the `CERE` column
contains that word (in any case), otherwise for `col·laborador` if it
contains `col·laborador` or `col.laborador`. An event counts at most once.

## Categories

| events  | label                 |
|---------|-----------------------|
| 1-5     | `1-5 esdeveniments`   |
| 6-10    | `6-10 esdeveniments`  |
| 11-25   | `11-25 esdeveniments` |
| 26-50   | `26-50 esdeveniments` |
| 51+     | `+ 50 esdeveniments`  |

## Configuration

`ebre_events --config dashboard.json` reads a JSON file of this form (all the
entries are optional except for a source):

```json
{
  "outputSettings": { "dashboardName": "Ebre", "outputFile": "summary.json" },
  "mapSource": { "provider": "csv", "url": "https://docs.google.com/spreadsheets/d/e/.../pub?output=csv" },
  "timelineSource": { "provider": "csv", "filePath": "activitats.csv" },
  "rules": {
    "variant": "presidentPeriod",
    "eventCategory": "Esdeveniments",
    "unspecifiedTypeLabel": "Sense especificar",
    "minSelectableYear": 2011,
    "topEventTypes": 10
  },
  "columns": { "role": "CERE" }
}
```

Relative file paths are read from the directory of the configuration file.
*/
