/*!

This is the long-form manual for `points_tally` and `tallyvotes`.

## Ballots

A ballot is a top-level comment (a comment that does not reply to another one) in the voting
thread. Every `Title (N)` written in it gives `N` points to `Title`:

```text
My picks this year:
Kirby and the Forgotten Land (5)
Tom Clancy's Splinter Cell (3) Ico (2)
Mother 3 (GBA) (1)
```

The pairs can be on separate lines or on the same line. A number in parentheses only counts as
points when it is followed by a space, a line break or the end of the comment, and the title is
the shortest text before it. This is why `Mother 3 (GBA) (1)` gives one point to `Mother 3 (GBA)`.

A comment with fewer pairs than the minimum (one by default) is not a ballot.

### Rules

With the default rules, a ballot may give at most 5 points to a title and 20 points in total.
A ballot breaking any rule is not counted at all, and is listed in the invalid ballots report
with all the rules it breaks. Both limits can be changed.

Titles that are not in the games list are ignored, listed in the ignored votes report, and do
not prevent the rest of the ballot from being counted.

## Games list

The games list is a TAB-separated file with a header row:

```text
game	alias1	alias2	roll_over_points
The Legend of Zelda: Breath of the Wild	BotW	Zelda BOTW	4
Disco Elysium	DE
# Commented out	ignored
```

- `game` (required): the canonical title.
- `alias*` (optional, any number): any column whose header starts with `alias` contains
  other names of the game.
- `roll_over_points`, `rollover_points` or `roll-over-points` (optional): points carried over
  from a previous round. They are added to the tally before any ballot. Several rows for the
  same game add up. A value that is not a non-negative integer counts as 0.

Headers are matched ignoring case. Rows whose title is empty or starts with `#` are skipped, as are
such aliases. The first sheet of an Excel workbook (`.xlsx`) with the same columns can be used
instead.

### Matching

Titles are compared after canonical unicode composition, replacement of typographic quotes,
dashes and non-breaking spaces by their plain versions, collapsing of the whitespace, and
lower-casing. In addition to the title and its aliases, the following variants are recognized:
- the title or alias without one trailing `!`, `?` or `.`,
- the title without a leading "The ".

When two games claim the same variant, the first one in the list keeps it. The conflict is
reported with `--debug`.

## Outputs

- the tally, a CSV file `game,total_points` listing every game of the list, including the ones
  without points, by decreasing points and then by title,
- the invalid ballots report, one line per author and distinct reason,
- the ignored votes report, grouped by author,
- optionally, a JSON summary with the counters and the tally.

## Configuration

All the options of the command line can also be provided in a JSON file with `--config`. Paths
in this file are relative to the directory of the file. Options on the command line take
precedence.

```json
{
  "url": "https://tildes.net/~games/1pvz/colossal_game_adventure_voting_topic",
  "gamesFile": "games_population.csv",
  "tallyOut": "tally.csv",
  "invalidOut": "invalid_votes.txt",
  "ignoredOut": "ignored_votes.txt",
  "rules": {
    "maxTotalPoints": 20,
    "maxPointsPerGame": 5,
    "minPairs": 1
  }
}
```

 */
